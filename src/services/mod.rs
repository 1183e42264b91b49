pub mod spotify_searcher;
pub mod track_searcher;
