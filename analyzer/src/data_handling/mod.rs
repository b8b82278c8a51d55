pub mod neutrosophic_results;
