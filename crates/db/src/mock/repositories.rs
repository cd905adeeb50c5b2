use async_trait::async_trait;
use clinic_core::{
    models::{
        appointment::{Appointment, DoctorId, PatientId},
        doctor::{Doctor, NewDoctor},
        patient::{NewPatient, Patient},
    },
    ports::{AppointmentLedger, DoctorRegistry, PatientRegistry},
};
use mockall::mock;

// Mock repositories for testing
mock! {
    pub PatientRepo {}

    #[async_trait]
    impl PatientRegistry for PatientRepo {
        async fn create_patient(&self, patient: &NewPatient) -> eyre::Result<Patient>;

        async fn list_patients(&self) -> eyre::Result<Vec<Patient>>;

        async fn get_patient(&self, id: PatientId) -> eyre::Result<Option<Patient>>;

        async fn update_patient(&self, id: PatientId, patient: &NewPatient) -> eyre::Result<Option<Patient>>;

        async fn delete_patient(&self, id: PatientId) -> eyre::Result<bool>;
    }
}

mock! {
    pub DoctorRepo {}

    #[async_trait]
    impl DoctorRegistry for DoctorRepo {
        async fn create_doctor(&self, doctor: &NewDoctor) -> eyre::Result<Doctor>;

        async fn list_doctors(&self) -> eyre::Result<Vec<Doctor>>;

        async fn get_doctor(&self, id: DoctorId) -> eyre::Result<Option<Doctor>>;

        async fn update_doctor(&self, id: DoctorId, doctor: &NewDoctor) -> eyre::Result<Option<Doctor>>;

        async fn delete_doctor(&self, id: DoctorId) -> eyre::Result<bool>;
    }
}

mock! {
    pub AppointmentRepo {}

    #[async_trait]
    impl AppointmentLedger for AppointmentRepo {
        async fn appointments_for_doctor(&self, doctor_id: DoctorId) -> eyre::Result<Vec<Appointment>>;
    }
}
