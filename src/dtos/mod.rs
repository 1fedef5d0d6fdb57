pub mod bookingdtos;
pub mod investmentdtos;
pub mod propertydtos;
pub mod userdtos;
