pub mod telematics;
