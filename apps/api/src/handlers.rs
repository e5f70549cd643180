pub mod blend;
pub mod health;
pub mod user_attributes;

#[cfg(test)]
mod test_fakes;
