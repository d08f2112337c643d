mod failures_test;
mod file_sink_test;
mod pipeline_test;
