pub mod domain_record;
