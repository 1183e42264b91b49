pub mod track_routes;
