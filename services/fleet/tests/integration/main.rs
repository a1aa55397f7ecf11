
mod otp_test;
mod pairing_test;
mod report_test;
mod token_test;
