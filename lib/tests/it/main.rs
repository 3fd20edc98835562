mod classify_resolve;
