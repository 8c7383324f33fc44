pub mod make_dirs;
