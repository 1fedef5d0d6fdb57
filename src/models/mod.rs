pub mod bookingmodel;
pub mod investmentmodel;
pub mod propertymodel;
pub mod usermodel;
