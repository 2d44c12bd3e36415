pub mod gitops_tests;
