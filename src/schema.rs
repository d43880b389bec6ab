// Kept in sync by hand with `DbContext::init_schema`.

diesel::table! {
    customers (id) {
        id -> Text,
        name -> Text,
    }
}

diesel::table! {
    visitors (id) {
        id -> Text,
        name -> Text,
    }
}

diesel::table! {
    door_panels (id) {
        id -> Text,
        name -> Text,
        location -> Nullable<Text>,
    }
}

diesel::table! {
    door_groups (id) {
        id -> Text,
        name -> Text,
    }
}

diesel::table! {
    door_access_state (id) {
        id -> Text,
        last_synced_with -> Nullable<Text>,
        synced_at -> Nullable<Text>,
    }
}

diesel::table! {
    iot_devices (id) {
        id -> Text,
        device_id -> Text,
    }
}

diesel::table! {
    iot_events (id) {
        id -> Text,
        device_id -> Text,
        payload -> Text,
        received_at -> Text,
    }
}

diesel::table! {
    users (id) {
        id -> Text,
        username -> Text,
        password_hash -> Text,
        created_at -> Text,
    }
}

diesel::table! {
    documents (id) {
        id -> Text,
        filename -> Text,
        path -> Text,
        created_at -> Text,
        prompt -> Nullable<Text>,
        analysis_type -> Nullable<Text>,
        result -> Nullable<Text>,
    }
}
