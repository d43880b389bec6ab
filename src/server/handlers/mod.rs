//! HTTP request handlers.

mod customers;
mod documents;
mod doors;
mod iot;
mod root;
mod users;
mod visitors;

pub use customers::{
    create_customer, delete_customer, get_customer, list_customers, update_customer,
};
pub use documents::{analyze_document, get_document, list_documents, list_presets};
pub use doors::{
    create_door_group, create_door_panel, delete_door_group, delete_door_panel, get_door_access,
    get_door_group, get_door_panel, list_door_groups, list_door_panels, sync_door_access,
    update_door_group, update_door_panel,
};
pub use iot::{
    create_iot_device, delete_iot_device, get_iot_device, ingest_iot_data, list_iot_data,
    list_iot_devices, list_mqtt_messages, publish_mqtt, update_iot_device,
};
pub use root::root;
pub use users::{me, signup};
pub use visitors::{
    create_visitor, delete_visitor, get_visitor, list_visitors, update_visitor,
};
