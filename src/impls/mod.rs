mod credential_storage;
