table! {
    appointments (id) {
        id -> Unsigned<Bigint>,
        patient_id -> Unsigned<Bigint>,
        doctor_id -> Unsigned<Bigint>,
        availability_id -> Unsigned<Bigint>,
        status -> Varchar,
        created_at -> Datetime,
        updated_at -> Datetime,
    }
}

table! {
    audit_logs (id) {
        id -> Unsigned<Bigint>,
        user_id -> Nullable<Unsigned<Bigint>>,
        action -> Varchar,
        target_table -> Varchar,
        target_id -> Nullable<Unsigned<Bigint>>,
        detail -> Nullable<Text>,
        created_at -> Datetime,
    }
}

table! {
    availability (id) {
        id -> Unsigned<Bigint>,
        doctor_id -> Unsigned<Bigint>,
        start_time -> Datetime,
        end_time -> Datetime,
    }
}

table! {
    consultations (id) {
        id -> Unsigned<Bigint>,
        appointment_id -> Unsigned<Bigint>,
        notes -> Text,
        prescription -> Nullable<Text>,
        outcome -> Nullable<Varchar>,
        recorded_by -> Nullable<Unsigned<Bigint>>,
        created_at -> Datetime,
    }
}

table! {
    doctor_specializations (doctor_id, specialization_id) {
        doctor_id -> Unsigned<Bigint>,
        specialization_id -> Unsigned<Bigint>,
    }
}

table! {
    feedback (id) {
        id -> Unsigned<Bigint>,
        appointment_id -> Unsigned<Bigint>,
        rating -> Integer,
        comments -> Nullable<Text>,
        created_at -> Datetime,
    }
}

table! {
    notifications (id) {
        id -> Unsigned<Bigint>,
        user_id -> Unsigned<Bigint>,
        appointment_id -> Nullable<Unsigned<Bigint>>,
        kind -> Varchar,
        status -> Varchar,
        message -> Text,
        created_at -> Datetime,
        sent_at -> Nullable<Datetime>,
    }
}

table! {
    recurring_appointments (id) {
        id -> Unsigned<Bigint>,
        patient_id -> Unsigned<Bigint>,
        doctor_id -> Unsigned<Bigint>,
        specialization_id -> Nullable<Unsigned<Bigint>>,
        frequency -> Varchar,
        preferred_time -> Time,
        start_date -> Date,
        end_date -> Nullable<Date>,
        created_at -> Datetime,
    }
}

table! {
    specializations (id) {
        id -> Unsigned<Bigint>,
        name -> Varchar,
        description -> Nullable<Text>,
    }
}

table! {
    users (id) {
        id -> Unsigned<Bigint>,
        full_name -> Varchar,
        email -> Varchar,
        phone -> Nullable<Varchar>,
        role -> Varchar,
        status -> Varchar,
        created_at -> Datetime,
    }
}

table! {
    virtual_links (id) {
        id -> Unsigned<Bigint>,
        appointment_id -> Unsigned<Bigint>,
        url -> Varchar,
        expires_at -> Datetime,
        created_at -> Datetime,
    }
}

table! {
    waitlist (id) {
        id -> Unsigned<Bigint>,
        patient_id -> Unsigned<Bigint>,
        doctor_id -> Nullable<Unsigned<Bigint>>,
        specialization_id -> Nullable<Unsigned<Bigint>>,
        preferred_date -> Nullable<Date>,
        status -> Varchar,
        created_at -> Datetime,
    }
}

joinable!(appointments -> availability (availability_id));
joinable!(consultations -> appointments (appointment_id));
joinable!(doctor_specializations -> specializations (specialization_id));
joinable!(feedback -> appointments (appointment_id));
joinable!(virtual_links -> appointments (appointment_id));

allow_tables_to_appear_in_same_query!(
    appointments,
    audit_logs,
    availability,
    consultations,
    doctor_specializations,
    feedback,
    notifications,
    recurring_appointments,
    specializations,
    users,
    virtual_links,
    waitlist,
);
