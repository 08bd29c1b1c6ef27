//! Engine unit tests with in-memory doubles
