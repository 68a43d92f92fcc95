mod codegen_runner_tests;
