pub mod invitation;
pub mod organization;
