mod doctor_test;
mod middleware_test;
mod patient_test;
