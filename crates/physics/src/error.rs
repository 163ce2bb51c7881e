use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PhysicsError {
    #[error("non-finite control input: {0}")]
    NonFiniteInput(f32),
    #[error("invalid system parameters: {0}")]
    InvalidConfig(&'static str),
}
