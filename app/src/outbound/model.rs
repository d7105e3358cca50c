pub mod status_event;
