pub mod detect_faces_use_case;
