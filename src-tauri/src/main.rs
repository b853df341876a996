// Prevents additional console window on Windows in release, DO NOT REMOVE!!
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

fn main() {
    onetime_editor_lib::logging::init();
    onetime_editor_lib::run()
}
