pub mod country_repo;
pub mod import_job_repo;

pub use country_repo::CountryRepo;
pub use import_job_repo::ImportJobRepo;
