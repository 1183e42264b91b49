pub mod track_controller;
