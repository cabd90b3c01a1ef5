pub mod portal_client;
