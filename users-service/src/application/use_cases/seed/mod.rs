pub mod seed_defaults;
