pub mod ctd;
