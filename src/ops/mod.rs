pub mod calendar;
pub mod edit;
pub mod scan;
pub mod search;
