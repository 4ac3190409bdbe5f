pub mod pg_notify_publisher;
