use ogmodel::formats::gmd::bone::write_bones;
use ogmodel::formats::gmd::mesh::write_meshes;
use ogmodel::formats::gmd::primitives::GmdWriteExt;
use ogmodel::formats::gmd::{GMD_MAGIC, GMD_VERSION, inspect_gmd_bytes, write_chunk};
use ogmodel::prelude::*;
use glam::{Quat, Vec2, Vec3};
use pretty_assertions::assert_eq;
use std::io::Cursor;
use std::sync::Arc;
use tempfile::tempdir;

/// Two bones, one mesh with three vertices carrying 0, 1 and 2 weights.
fn scenario_model() -> Model {
    let mut model = Model::new();
    model.add_bone(Bone::new("Root", -1, Vec3::ZERO, Quat::IDENTITY));
    model.add_bone(Bone::new(
        "Spine",
        0,
        Vec3::new(0.0, 1.5, 0.0),
        Quat::from_xyzw(0.0, 0.0, 0.707_106_8, 0.707_106_8),
    ));

    let mut mesh = AnimatedMesh::new("Body", "skin_mat");
    mesh.flags = 1;
    mesh.detail_level = 0;
    mesh.add_vertex(Vec2::new(0.0, 0.0), Vec::new());
    mesh.add_vertex(
        Vec2::new(1.0, 0.0),
        vec![VertexWeight::new(0, Vec3::new(1.0, 0.0, 0.0), Vec3::Y, 1.0)],
    );
    mesh.add_vertex(
        Vec2::new(0.5, 1.0),
        vec![
            VertexWeight::new(0, Vec3::new(0.0, 2.0, 0.0), Vec3::Z, 0.6),
            VertexWeight::new(1, Vec3::new(0.0, 0.5, 0.0), Vec3::Z, 0.4),
        ],
    );
    mesh.indices = vec![0, 2];
    model.add_mesh(mesh);
    model
}

fn memory_store() -> (MemoryFileSystem, ModelStore) {
    let fs = MemoryFileSystem::new();
    let store = ModelStore::new(Arc::new(fs.clone()));
    (fs, store)
}

#[test]
fn test_scenario_round_trip() {
    let (_fs, store) = memory_store();
    let model = scenario_model();

    assert!(store.save(&model, "characters/hero.gmd"));
    let loaded = store.load("characters/hero.gmd").unwrap();

    assert_eq!(loaded.bones, model.bones);
    assert_eq!(loaded.meshes, model.meshes);
    assert_eq!(loaded.name, "hero");

    let mesh = loaded.meshes[0].as_animated().unwrap();
    let counts: Vec<usize> = mesh.vertices.iter().map(|v| v.num_weights()).collect();
    assert_eq!(counts, vec![0, 1, 2]);
    assert_eq!(mesh.vertices[2].weights[0].bone_id, 0);
    assert_eq!(mesh.vertices[2].weights[1].bone_id, 1);
    assert!(loaded.validate().valid);
}

#[test]
fn test_many_bones_and_meshes() {
    let (_fs, store) = memory_store();
    let mut model = Model::new();
    for i in 0..20 {
        let parent = if i == 0 { -1 } else { i - 1 };
        model.add_bone(Bone::new(format!("b{i}"), parent, Vec3::splat(i as f32), Quat::IDENTITY));
    }
    for m in 0..5 {
        let mut mesh = AnimatedMesh::new(format!("mesh{m}"), format!("mat{m}"));
        mesh.detail_level = m;
        for v in 0..4 {
            mesh.add_vertex(
                Vec2::new(v as f32, 0.0),
                vec![VertexWeight::new(v, Vec3::ONE, Vec3::Y, 1.0)],
            );
        }
        mesh.indices = vec![0, 1, 2, 2, 3, 0];
        model.add_mesh(mesh);
    }

    store.try_save(&model, "many.gmd").unwrap();
    let loaded = store.try_load_with("many.gmd", &LoadOptions::strict()).unwrap();
    assert_eq!(loaded.bones, model.bones);
    assert_eq!(loaded.meshes, model.meshes);
}

#[test]
fn test_unknown_chunk_between_known_chunks() {
    let model = scenario_model();
    let mut cursor = Cursor::new(header_bytes(3));
    cursor.set_position(cursor.get_ref().len() as u64);
    write_chunk(&mut cursor, "Bones", 2, |w| write_bones(w, &model.bones)).unwrap();
    write_chunk(&mut cursor, "Materials", 7, |w| {
        for i in 0..7 {
            w.write_gmd_string(&format!("material {i}"))?;
        }
        Ok(())
    })
    .unwrap();
    write_chunk(&mut cursor, "Meshes", 1, |w| write_meshes(w, &model.meshes)).unwrap();

    let data = cursor.into_inner();
    let loaded = parse_gmd_bytes(&data).unwrap();
    assert_eq!(loaded.bones, model.bones);
    assert_eq!(loaded.meshes, model.meshes);

    let info = inspect_gmd_bytes(&data).unwrap();
    let names: Vec<&str> = info.chunks.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Bones", "Materials", "Meshes"]);
    assert!(!info.chunks[1].known);
}

/// File header announcing two bones, one mesh and `chunks` chunks.
fn header_bytes(chunks: u32) -> Vec<u8> {
    let mut data = GMD_MAGIC.to_vec();
    data.write_gmd_i32(GMD_VERSION).unwrap();
    data.write_gmd_string("hero").unwrap();
    data.write_gmd_string("someone").unwrap();
    data.write_gmd_string("newer tool").unwrap();
    data.write_gmd_u32(2).unwrap();
    data.write_gmd_u32(1).unwrap();
    data.write_gmd_u32(chunks).unwrap();
    data
}

#[test]
fn test_format_errors() {
    let mut data = serialize_gmd(&scenario_model()).unwrap();

    let mut bad_magic = data.clone();
    bad_magic[0] = b'X';
    assert!(matches!(parse_gmd_bytes(&bad_magic), Err(Error::InvalidGmdMagic(_))));

    let mut bad_version = data.clone();
    bad_version[4] = 2;
    let err = parse_gmd_bytes(&bad_version).unwrap_err();
    assert_eq!(err.to_string(), "wrong version (2), should be (1)");

    data.truncate(data.len() - 3);
    assert!(parse_gmd_bytes(&data).unwrap_err().is_unexpected_eof());
}

#[test]
fn test_oversize_string_rejected() {
    let mut data = GMD_MAGIC.to_vec();
    data.write_gmd_i32(GMD_VERSION).unwrap();
    data.write_gmd_u32(u32::MAX).unwrap();

    let err = parse_gmd_bytes(&data).unwrap_err();
    assert!(matches!(err, Error::StringTooLong { .. }));
}

#[test]
fn test_native_file_system() {
    let dir = tempdir().unwrap();
    let store = ModelStore::new(Arc::new(NativeFileSystem::with_root(dir.path())));

    assert!(store.save(&scenario_model(), "nested/dir/hero.gmd"));
    assert!(dir.path().join("nested/dir/hero.gmd").is_file());

    let loaded = store.load("nested/dir/hero.gmd").unwrap();
    assert_eq!(loaded.meshes, scenario_model().meshes);

    assert!(store.load("absent.gmd").is_none());
}

#[test]
fn test_unwritable_target() {
    let dir = tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, b"file, not a directory").unwrap();

    let store = ModelStore::native();
    assert!(!store.save(&scenario_model(), blocker.join("hero.gmd")));
}

#[test]
fn test_batch_validate_directory() {
    let dir = tempdir().unwrap();
    let store = ModelStore::native();

    let mut broken = scenario_model();
    broken.meshes[0].as_animated_mut().unwrap().vertices[1].weights[0].bone_id = 9;

    assert!(store.save(&scenario_model(), dir.path().join("a/good.gmd")));
    assert!(store.save(&broken, dir.path().join("b/broken.gmd")));

    let files = find_gmd_files(dir.path());
    assert_eq!(files.len(), 2);

    let result = batch_validate(&store, &files, |_| {});
    assert_eq!(result.success_count, 1);
    assert_eq!(result.fail_count, 1);
    assert!(!result.results[1].ok);
}
