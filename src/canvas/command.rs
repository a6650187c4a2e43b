//! Line-oriented commands driving a [`CanvasSession`](super::CanvasSession).

use std::path::PathBuf;
use std::str::FromStr;

/// One line of input to the interactive front-end.
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasCommand {
    /// `stroke x,y x,y ...`: draw a polyline.
    Stroke(Vec<(f32, f32)>),
    /// `predict`
    Predict,
    /// `clear`
    Clear,
    /// `save <path>`: write the surface to an image file.
    Save(PathBuf),
    /// `reload`: retry loading the classifier.
    Reload,
    /// `help`
    Help,
    /// `quit` or `exit`
    Quit,
}

/// Usage text printed by `help`.
pub const HELP: &str = "\
commands:
  stroke x,y x,y ...   draw a line through the given points
  predict              classify the drawing
  clear                erase the canvas
  save <path>          write the canvas to an image file
  reload               retry loading the model
  help                 show this text
  quit                 exit";

impl FromStr for CanvasCommand {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map(|(w, r)| (w, r.trim()))
            .unwrap_or((line, ""));
        match word.to_ascii_lowercase().as_str() {
            "stroke" => parse_points(rest).map(CanvasCommand::Stroke),
            "predict" => Ok(CanvasCommand::Predict),
            "clear" => Ok(CanvasCommand::Clear),
            "save" if !rest.is_empty() => Ok(CanvasCommand::Save(PathBuf::from(rest))),
            "save" => Err("save needs a file path".to_string()),
            "reload" => Ok(CanvasCommand::Reload),
            "help" | "?" => Ok(CanvasCommand::Help),
            "quit" | "exit" => Ok(CanvasCommand::Quit),
            "" => Err("empty command".to_string()),
            other => Err(format!("unknown command '{other}', try 'help'")),
        }
    }
}

fn parse_points(text: &str) -> Result<Vec<(f32, f32)>, String> {
    let points = text
        .split_whitespace()
        .map(|pair| {
            let (x, y) = pair
                .split_once(',')
                .ok_or_else(|| format!("point '{pair}' must be written as x,y"))?;
            let x = x
                .parse::<f32>()
                .map_err(|e| format!("bad x coordinate in '{pair}': {e}"))?;
            let y = y
                .parse::<f32>()
                .map_err(|e| format!("bad y coordinate in '{pair}': {e}"))?;
            if !x.is_finite() || !y.is_finite() {
                return Err(format!("point '{pair}' is not finite"));
            }
            Ok((x, y))
        })
        .collect::<Result<Vec<_>, String>>()?;
    if points.is_empty() {
        return Err("stroke needs at least one point".to_string());
    }
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_stroke() {
        let command: CanvasCommand = "stroke 10,20  30.5,40".parse().unwrap();
        assert_eq!(
            command,
            CanvasCommand::Stroke(vec![(10.0, 20.0), (30.5, 40.0)])
        );
    }

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!("predict".parse(), Ok(CanvasCommand::Predict));
        assert_eq!("  CLEAR ".parse(), Ok(CanvasCommand::Clear));
        assert_eq!("exit".parse(), Ok(CanvasCommand::Quit));
        assert_eq!(
            "save out/digit.png".parse(),
            Ok(CanvasCommand::Save(PathBuf::from("out/digit.png")))
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!("stroke".parse::<CanvasCommand>().is_err());
        assert!("stroke 1;2".parse::<CanvasCommand>().is_err());
        assert!("stroke a,2".parse::<CanvasCommand>().is_err());
        assert!("save".parse::<CanvasCommand>().is_err());
        assert!("draw".parse::<CanvasCommand>().is_err());
        assert!("".parse::<CanvasCommand>().is_err());
    }
}
