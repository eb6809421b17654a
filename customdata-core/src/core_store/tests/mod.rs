/*
    Integration tests for core_store subsystem

    Test suite covering:
    - Notification ordering for every mutation path
    - Sentinel, rename and reset invariants
    - Edge cases (lonely sentinel, multi-byte sizes, contract violations)
    - Property tests over random operation sequences
*/

pub mod store_edge_cases;
