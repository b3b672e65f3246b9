pub mod progress_controller;
