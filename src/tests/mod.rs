mod prop_tests;
