//! Webcam and terminal front end for the classifier.
pub mod console;
pub mod sensors;
pub mod shell;
