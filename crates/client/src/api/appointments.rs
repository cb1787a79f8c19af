//! Appointments client methods

use crate::client::PortalClient;
use crate::error::ClientError;
use crate::types::{Appointment, AppointmentCreate};
use reqwest::Method;

impl PortalClient {
    /// List the current user's appointments
    pub async fn my_appointments(&self) -> Result<Vec<Appointment>, ClientError> {
        let request = self.request(Method::GET, "/appointments/my-appointments");
        self.execute(request).await
    }

    /// Book an appointment with a doctor (patients only)
    pub async fn create_appointment(
        &self,
        appointment: &AppointmentCreate,
    ) -> Result<Appointment, ClientError> {
        let request = self
            .request(Method::POST, "/appointments/")
            .json(appointment);
        self.execute(request).await
    }
}
