//! Concrete collaborators used by the `voxshell` binary.
//!
//! These are deliberately small: a console stands in for the microphone and
//! the speaker, tagged lines stand in for a trained intent model, and any
//! OpenAI-compatible endpoint answers chat and realtime queries.

pub mod automation;
pub mod classifier;
pub mod completion;
pub mod console;

pub use automation::LoggingAutomation;
pub use classifier::PrefixClassifier;
pub use completion::{ChatCompletionResponder, ResponderFlavor};
pub use console::{ConsoleRecognizer, ConsoleSpeech};
