//! The interactive front-end.
//!
//! A [`DrawingCanvas`] stands in for the browser drawing surface and a
//! [`CanvasSession`] connects it to the shared pipeline. Unlike the HTTP
//! server, a missing model does not stop the session: it is shown as a
//! banner and can be reloaded. The canvas path also turns a blank drawing
//! into a "please draw a digit" message instead of a prediction.

mod command;
mod message;
mod session;
mod surface;

pub use command::{CanvasCommand, HELP};
pub use message::{CanvasMessage, MessageStyle};
pub use session::{CanvasSession, ClassifierState};
pub use surface::DrawingCanvas;
