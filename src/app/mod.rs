pub mod import_job;
