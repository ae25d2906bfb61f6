pub mod synthetic_blot;
