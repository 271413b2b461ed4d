//! Appointment mutations.

use tracing::info;

use super::{ClinicStore, Domain, StoreError, StoreResult};
use crate::models::{Appointment, AppointmentPatch, AppointmentStatus, NewAppointment};

impl ClinicStore {
    /// Book an appointment. The pet must belong to the given owner.
    ///
    /// Pet name and owner name/phone are copied onto the appointment as they
    /// are now; later renames do not rewrite existing bookings.
    pub async fn add_appointment(&self, data: NewAppointment) -> StoreResult<String> {
        self.mutate(Domain::Appointments, "add_appointment", move |state, now| {
            let (owner, pet) = state.check_pet_of_owner(&data.pet_id, &data.owner_id)?;

            let appointment = Appointment {
                id: uuid::Uuid::new_v4().to_string(),
                pet_name: pet.name.clone(),
                owner_name: owner.full_name.clone(),
                owner_phone: owner.phone.clone(),
                pet_id: data.pet_id,
                owner_id: data.owner_id,
                duration_minutes: data.appointment_type.duration_minutes(),
                appointment_type: data.appointment_type,
                date: data.date,
                start_time: data.start_time,
                status: data.status.unwrap_or(AppointmentStatus::Scheduled),
                notes: data.notes,
                reminder_sent: false,
                created_at: now,
                updated_at: now,
            };

            let id = appointment.id.clone();
            info!(
                appointment_id = %id,
                pet_id = %appointment.pet_id,
                date = %appointment.date,
                status = %appointment.status,
                "appointment booked"
            );
            state.appointments.push(appointment);
            Ok(id)
        })
        .await
    }

    /// Merge `patch` into an appointment. A status change must be allowed by
    /// the configured transition policy.
    pub async fn update_appointment(&self, id: &str, patch: AppointmentPatch) -> StoreResult<()> {
        let id = id.to_string();
        let policy = self.config.transition_policy;
        self.mutate(Domain::Appointments, "update_appointment", move |state, now| {
            let appointment = state
                .appointments
                .iter_mut()
                .find(|a| a.id == id)
                .ok_or_else(|| StoreError::not_found("appointment", &id))?;

            if let Some(next) = patch.status {
                if !policy.allows(appointment.status, next) {
                    return Err(StoreError::InvalidStateTransition {
                        from: appointment.status,
                        to: next,
                    });
                }
            }

            let previous = appointment.status;
            patch.apply(appointment, now);
            info!(
                appointment_id = %id,
                from = %previous,
                to = %appointment.status,
                "appointment updated"
            );
            Ok(())
        })
        .await
    }

    /// Cancel an appointment. The record is kept with status `cancelled`.
    pub async fn cancel_appointment(&self, id: &str) -> StoreResult<()> {
        self.update_appointment(id, AppointmentPatch::status(AppointmentStatus::Cancelled))
            .await
    }

    /// Record that the owner has been reminded.
    pub async fn mark_reminder_sent(&self, id: &str) -> StoreResult<()> {
        self.update_appointment(
            id,
            AppointmentPatch {
                reminder_sent: Some(true),
                ..Default::default()
            },
        )
        .await
    }
}
