mod test_room_lifecycle;
