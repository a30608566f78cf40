pub mod scripted_source;
