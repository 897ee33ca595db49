mod test_disconnect_leaves_rooms;
mod test_reconnect_replaces_endpoint;
