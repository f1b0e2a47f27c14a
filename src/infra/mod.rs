pub mod mygeotab;
