pub mod principal;

pub use principal::{
    validate_otp_shape, validate_phone, AdminUserPublic, Principal, Role, UserPublic,
};
