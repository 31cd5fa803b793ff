pub mod admin_handler;

pub use admin_handler::{
    __path_delete_ormas, __path_get_draft, __path_list_ormas, __path_login, __path_logout,
    __path_pick_location, __path_submit_ormas, delete_ormas, get_draft, list_ormas, login,
    logout, pick_location, submit_ormas,
};
