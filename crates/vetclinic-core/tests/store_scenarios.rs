//! End-to-end store scenarios: registration, booking, cascades, views.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use vetclinic_core::{
    AppointmentStatus, AppointmentType, ClinicStore, FixedClock, NewAppointment,
    NewMedicalRecord, NewOwner, NewPet, OwnerPatch, PetPatch, Species, StoreConfig, StoreError,
    Vaccine,
};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
}

fn at(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn store() -> ClinicStore {
    ClinicStore::with_clock(StoreConfig::for_tests(), Arc::new(FixedClock::on(today())))
}

/// Registers an owner with one pet and returns (owner_id, pet_id).
async fn owner_with_pet(
    store: &ClinicStore,
    owner: &str,
    pet: &str,
    species: Species,
) -> anyhow::Result<(String, String)> {
    let owner_id = store
        .add_owner(NewOwner::named(owner).with_pet(NewPet::new(pet, species)))
        .await?;
    let pet_id = store
        .get_owner_by_id(&owner_id)
        .and_then(|o| o.pets.first().map(|p| p.id.clone()))
        .ok_or_else(|| anyhow::anyhow!("initial pet missing"))?;
    Ok((owner_id, pet_id))
}

#[tokio::test]
async fn scenario_a_todays_confirmed_appointment() -> anyhow::Result<()> {
    let store = store();
    let (owner_id, pet_id) = owner_with_pet(&store, "Carlos Pérez", "Max", Species::Dog).await?;

    let id = store
        .add_appointment(
            NewAppointment::new(&pet_id, &owner_id, AppointmentType::Consultation, today(), at(10, 0))
                .with_status(AppointmentStatus::Confirmed),
        )
        .await?;

    let todays = store.get_appointments_by_date(today());
    assert_eq!(todays.len(), 1);
    assert_eq!(todays[0].id, id);
    assert_eq!(store.get_stats().today_appointments, 1);
    assert_eq!(store.get_today_schedule()[0].pet_name, "Max");
    Ok(())
}

#[tokio::test]
async fn scenario_b_add_pet_to_owner_without_pets() -> anyhow::Result<()> {
    let store = store();
    let owner_id = store.add_owner(NewOwner::named("María García")).await?;
    assert!(store.get_owner_by_id(&owner_id).unwrap().pets.is_empty());

    let mut rocky = NewPet::new("Rocky", Species::Dog);
    rocky.breed = "Boxer".into();
    rocky.age = 4;
    rocky.weight = 28.5;
    store.add_pet(&owner_id, rocky).await?;

    let owner = store.get_owner_by_id(&owner_id).unwrap();
    assert_eq!(owner.pets.len(), 1);
    assert_eq!(owner.pets[0].name, "Rocky");
    assert_eq!(owner.pets[0].owner_id, owner_id);
    assert_eq!(store.get_pet_by_id(&owner.pets[0].id).unwrap().breed, "Boxer");
    Ok(())
}

#[tokio::test]
async fn scenario_c_cancelled_appointment_leaves_upcoming() -> anyhow::Result<()> {
    let store = store();
    let (owner_id, pet_id) = owner_with_pet(&store, "Carlos Pérez", "Max", Species::Dog).await?;
    let tomorrow = today().succ_opt().unwrap();

    let id = store
        .add_appointment(NewAppointment::new(
            &pet_id,
            &owner_id,
            AppointmentType::Vaccination,
            tomorrow,
            at(9, 0),
        ))
        .await?;
    assert_eq!(store.get_upcoming_appointments().len(), 1);

    store.cancel_appointment(&id).await?;

    let appointment = store.get_appointment_by_id(&id).unwrap();
    assert_eq!(appointment.status, AppointmentStatus::Cancelled);
    assert!(store.get_upcoming_appointments().is_empty());
    // Cancelling keeps the record.
    assert_eq!(store.appointments().len(), 1);
    Ok(())
}

#[tokio::test]
async fn scenario_d_deleting_one_owner_spares_the_other() -> anyhow::Result<()> {
    let store = store();
    let (carlos, max) = owner_with_pet(&store, "Carlos Pérez", "Max", Species::Dog).await?;
    let (carla, luna) = owner_with_pet(&store, "Carla Pereira", "Luna", Species::Cat).await?;

    for (owner, pet) in [(&carlos, &max), (&carla, &luna)] {
        store
            .add_appointment(NewAppointment::new(
                pet.as_str(),
                owner.as_str(),
                AppointmentType::Grooming,
                today(),
                at(11, 0),
            ))
            .await?;
        store
            .add_medical_record(NewMedicalRecord::new(
                pet.as_str(),
                today(),
                "Dr. Smith",
                AppointmentType::Grooming,
            ))
            .await?;
    }
    assert_eq!(store.search_owners("carl", 10).len(), 2);

    store.delete_owner(&carlos).await?;

    assert!(store.get_owner_by_id(&carlos).is_none());
    assert!(store.get_pet_by_id(&max).is_none());
    assert!(store.get_appointments_by_pet(&max).is_empty());
    assert!(store.get_medical_history_by_pet(&max).is_empty());

    let carla_owner = store.get_owner_by_id(&carla).unwrap();
    assert_eq!(carla_owner.pets.len(), 1);
    assert_eq!(store.get_appointments_by_owner(&carla).len(), 1);
    assert_eq!(store.get_medical_history_by_pet(&luna).len(), 1);
    assert_eq!(store.search_owners("carl", 10).len(), 1);
    Ok(())
}

#[tokio::test]
async fn delete_pet_cascades_precisely() -> anyhow::Result<()> {
    let store = store();
    let (owner_id, max) = owner_with_pet(&store, "Carlos Pérez", "Max", Species::Dog).await?;
    let kira = store
        .add_pet(&owner_id, NewPet::new("Kira", Species::Dog))
        .await?;

    for pet in [&max, &max, &kira] {
        store
            .add_appointment(NewAppointment::new(
                pet.as_str(),
                &owner_id,
                AppointmentType::Consultation,
                today(),
                at(9, 0),
            ))
            .await?;
        store
            .add_medical_record(NewMedicalRecord::new(
                pet.as_str(),
                today(),
                "Dr. Smith",
                AppointmentType::Consultation,
            ))
            .await?;
    }
    let kira_appointments = store.get_appointments_by_pet(&kira);
    let kira_records = store.get_medical_history_by_pet(&kira);

    store.delete_pet(&max).await?;

    let owner = store.get_owner_by_id(&owner_id).unwrap();
    assert_eq!(owner.pets.len(), 1);
    assert_eq!(owner.pets[0].id, kira);
    assert_eq!(store.appointments(), kira_appointments);
    assert_eq!(store.medical_records(), kira_records);
    Ok(())
}

#[tokio::test]
async fn add_owner_round_trip() -> anyhow::Result<()> {
    let store = store();
    let data = NewOwner {
        full_name: "Lucía Torres".into(),
        national_id: "12345678Z".into(),
        address: "Calle Mayor 1, Madrid".into(),
        phone: "+34 600 000 000".into(),
        email: "lucia@example.com".into(),
        initial_pet: None,
    };
    let id = store.add_owner(data.clone()).await?;

    let owner = store.get_owner_by_id(&id).unwrap();
    assert_eq!(owner.id, id);
    assert_eq!(owner.full_name, data.full_name);
    assert_eq!(owner.national_id, data.national_id);
    assert_eq!(owner.address, data.address);
    assert_eq!(owner.phone, data.phone);
    assert_eq!(owner.email, data.email);
    assert!(owner.pets.is_empty());
    assert_eq!(owner.created_at, owner.updated_at);
    Ok(())
}

#[tokio::test]
async fn empty_patch_only_moves_updated_at() -> anyhow::Result<()> {
    let clock = Arc::new(FixedClock::on(today()));
    let store = ClinicStore::with_clock(StoreConfig::for_tests(), clock.clone());
    let (owner_id, _) = owner_with_pet(&store, "Carlos Pérez", "Max", Species::Dog).await?;
    let before = store.get_owner_by_id(&owner_id).unwrap();

    clock.advance(chrono::Duration::minutes(5));
    store.update_owner(&owner_id, OwnerPatch::default()).await?;

    let after = store.get_owner_by_id(&owner_id).unwrap();
    assert!(after.updated_at > before.updated_at);
    let mut normalized = after.clone();
    normalized.updated_at = before.updated_at;
    assert_eq!(normalized, before);
    Ok(())
}

#[tokio::test]
async fn renaming_does_not_rewrite_bookings() -> anyhow::Result<()> {
    let store = store();
    let (owner_id, pet_id) = owner_with_pet(&store, "Carlos Pérez", "Max", Species::Dog).await?;
    let id = store
        .add_appointment(NewAppointment::new(
            &pet_id,
            &owner_id,
            AppointmentType::Consultation,
            today(),
            at(9, 0),
        ))
        .await?;

    store
        .update_owner(
            &owner_id,
            OwnerPatch {
                full_name: Some("Carlos Pérez Gil".into()),
                ..Default::default()
            },
        )
        .await?;
    store
        .update_pet(
            &pet_id,
            PetPatch {
                name: Some("Maximus".into()),
                ..Default::default()
            },
        )
        .await?;

    let appointment = store.get_appointment_by_id(&id).unwrap();
    assert_eq!(appointment.owner_name, "Carlos Pérez");
    assert_eq!(appointment.pet_name, "Max");
    Ok(())
}

#[tokio::test]
async fn failed_mutations_change_nothing() -> anyhow::Result<()> {
    let store = store();
    let (owner_id, pet_id) = owner_with_pet(&store, "Carlos Pérez", "Max", Species::Dog).await?;
    let before = store.snapshot();

    assert!(matches!(
        store.delete_owner("missing").await,
        Err(StoreError::NotFound { .. })
    ));
    assert!(matches!(
        store
            .update_pet(
                &pet_id,
                PetPatch {
                    name: Some(" ".into()),
                    ..Default::default()
                },
            )
            .await,
        Err(StoreError::InvalidInput(_))
    ));
    assert!(matches!(
        store
            .add_appointment(NewAppointment::new(
                "missing",
                &owner_id,
                AppointmentType::Consultation,
                today(),
                at(9, 0),
            ))
            .await,
        Err(StoreError::ReferentialIntegrity(_))
    ));

    assert_eq!(store.snapshot(), before);
    assert!(!store.is_loading());
    Ok(())
}

#[tokio::test]
async fn upcoming_vaccinations_come_from_records() -> anyhow::Result<()> {
    let store = store();
    let (_, pet_id) = owner_with_pet(&store, "Ana Ruiz", "Luna", Species::Cat).await?;
    let given = NaiveDate::from_ymd_opt(2023, 9, 1).unwrap();

    let mut visit = NewMedicalRecord::new(&pet_id, given, "Dr. Smith", AppointmentType::Vaccination);
    visit.vaccines = vec![
        Vaccine {
            name: "Rabies".into(),
            administered_date: given,
            next_due_date: NaiveDate::from_ymd_opt(2024, 9, 1).unwrap(),
            notes: None,
        },
        Vaccine {
            name: "FVRCP".into(),
            administered_date: given,
            next_due_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            notes: Some("overdue".into()),
        },
    ];
    store.add_medical_record(visit).await?;

    let upcoming = store.get_upcoming_vaccinations();
    assert_eq!(upcoming.len(), 1);
    assert_eq!(upcoming[0].vaccine_name, "Rabies");
    assert_eq!(upcoming[0].pet_name, "Luna");
    assert_eq!(upcoming[0].owner_name, "Ana Ruiz");
    Ok(())
}

#[tokio::test]
async fn huge_vaccination_window_is_no_limit() -> anyhow::Result<()> {
    let config = StoreConfig {
        upcoming_vaccination_window_days: Some(u32::MAX),
        ..StoreConfig::for_tests()
    };
    let store = ClinicStore::with_clock(config, Arc::new(FixedClock::on(today())));
    let (_, pet_id) = owner_with_pet(&store, "Ana Ruiz", "Luna", Species::Cat).await?;
    let given = NaiveDate::from_ymd_opt(2023, 9, 1).unwrap();

    let mut visit = NewMedicalRecord::new(&pet_id, given, "Dr. Smith", AppointmentType::Vaccination);
    visit.vaccines = vec![Vaccine {
        name: "Rabies".into(),
        administered_date: given,
        next_due_date: NaiveDate::from_ymd_opt(2030, 9, 1).unwrap(),
        notes: None,
    }];
    store.add_medical_record(visit).await?;

    let upcoming = store.get_upcoming_vaccinations();
    assert_eq!(upcoming.len(), 1);
    assert_eq!(upcoming[0].vaccine_name, "Rabies");
    Ok(())
}

#[tokio::test]
async fn pending_reminders_clear_when_marked()-> anyhow::Result<()> {
    let store = store();
    let (owner_id, pet_id) = owner_with_pet(&store, "Carlos Pérez", "Max", Species::Dog).await?;
    let id = store
        .add_appointment(NewAppointment::new(
            &pet_id,
            &owner_id,
            AppointmentType::Vaccination,
            today().succ_opt().unwrap(),
            at(9, 0),
        ))
        .await?;
    assert_eq!(store.get_pending_reminders().len(), 1);

    store.mark_reminder_sent(&id).await?;
    assert!(store.get_pending_reminders().is_empty());
    assert_eq!(store.get_upcoming_appointments().len(), 1);
    Ok(())
}

#[tokio::test]
async fn snapshot_init_and_reset() -> anyhow::Result<()> {
    let store = store();
    let (owner_id, pet_id) = owner_with_pet(&store, "Carlos Pérez", "Max", Species::Dog).await?;
    store
        .add_appointment(NewAppointment::new(
            &pet_id,
            &owner_id,
            AppointmentType::Surgery,
            today(),
            at(8, 0),
        ))
        .await?;
    let json = store.snapshot().to_json()?;

    let other = ClinicStore::new(StoreConfig::for_tests());
    other.init_from_json(&json)?;
    assert_eq!(other.snapshot(), store.snapshot());

    // A snapshot with a dangling appointment is refused and the store kept.
    let mut broken = store.snapshot();
    broken.appointments[0].pet_id = "ghost".into();
    assert!(matches!(
        other.init(broken),
        Err(StoreError::ReferentialIntegrity(_))
    ));
    assert_eq!(other.appointments().len(), 1);

    // So is one whose pet lists a medical record that was never filed.
    let mut broken = store.snapshot();
    broken.owners[0].pets[0]
        .medical_history
        .push("no-such-record".into());
    assert!(matches!(
        other.init(broken),
        Err(StoreError::ReferentialIntegrity(_))
    ));
    assert!(other.get_pet_by_id(&pet_id).is_some_and(|p| p.medical_history.is_empty()));

    other.reset();
    assert!(other.owners().is_empty());
    assert!(other.appointments().is_empty());
    assert_eq!(store.owners().len(), 1);
    Ok(())
}

#[tokio::test]
async fn schedule_export_for_today() -> anyhow::Result<()> {
    let store = store();
    let (owner_id, pet_id) = owner_with_pet(&store, "Carlos Pérez", "Max", Species::Dog).await?;
    for start in [at(15, 0), at(9, 30)] {
        store
            .add_appointment(NewAppointment::new(
                &pet_id,
                &owner_id,
                AppointmentType::Consultation,
                today(),
                start,
            ))
            .await?;
    }

    let export = store.export_schedule(today());
    assert_eq!(export.entries.len(), 2);
    assert_eq!(export.entries[0].start_time, at(9, 30));
    assert_eq!(export.booked_minutes, 60);
    assert_eq!(export.to_csv().lines().count(), 3);
    Ok(())
}
