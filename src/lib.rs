pub mod mediatag_core;
