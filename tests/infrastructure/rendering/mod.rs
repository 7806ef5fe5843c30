mod rendering_test;
