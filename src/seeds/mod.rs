pub mod lookup_seed;
