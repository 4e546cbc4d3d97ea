//! Path and replacement resolution for the built-in profiles.

use std::path::{Path, PathBuf};

use classgen_core::resolve::keys;
use classgen_core::{CoreError, FixedClock, Profile, ReplacementValue, Resolver};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn resolver(profile: Profile) -> Resolver {
    Resolver::with_clock(profile, FixedClock(2021))
}

#[test]
fn test_broker_layout() {
    let paths = resolver(Profile::broker())
        .resolve_paths(Path::new("/r"), "broker::detail::Foo", None)
        .unwrap();

    assert_eq!(paths.component, "broker");
    assert_eq!(paths.header, PathBuf::from("/r/broker/include/broker/detail/Foo.hh"));
    assert_eq!(paths.source, PathBuf::from("/r/broker/src/detail/Foo.cc"));
    assert_eq!(paths.test, PathBuf::from("/r/broker/tests/cpp/detail/Foo.cc"));

    let cmake = &paths.cmake;
    assert_eq!(cmake.file, PathBuf::from("/r/broker/CMakeLists.txt"));
    assert_eq!(cmake.source_var, "BROKER_SRC");
    assert_eq!(cmake.source_marker, "set(BROKER_SRC");
    assert_eq!(cmake.source_path, PathBuf::from("src/detail/Foo.cc"));
    assert_eq!(cmake.test_file, PathBuf::from("/r/broker/tests/CMakeLists.txt"));
    assert_eq!(cmake.test_var, "tests");
    assert_eq!(cmake.test_marker, "set(tests");
    assert_eq!(cmake.test_path, PathBuf::from("cpp/detail/Foo.cc"));
    assert_eq!(cmake.test_suite, Some(PathBuf::from("cpp/detail/Foo.cc")));
}

#[test]
fn test_caf_layout() {
    let paths = resolver(Profile::caf())
        .resolve_paths(Path::new("/r"), "caf::io::basp::header", None)
        .unwrap();

    assert_eq!(paths.component, "libcaf_io");
    assert_eq!(paths.header, PathBuf::from("/r/caf/libcaf_io/caf/io/basp/header.hpp"));
    assert_eq!(paths.source, PathBuf::from("/r/caf/libcaf_io/src/io/basp/header.cpp"));
    assert_eq!(paths.test, PathBuf::from("/r/caf/libcaf_io/test/io/basp/header.cpp"));

    let cmake = &paths.cmake;
    assert_eq!(cmake.file, PathBuf::from("/r/caf/libcaf_io/CMakeLists.txt"));
    assert_eq!(cmake.source_var, "CAF_IO_SOURCES");
    assert_eq!(cmake.source_path, PathBuf::from("src/io/basp/header.cpp"));
    assert_eq!(cmake.test_file, cmake.file);
    assert_eq!(cmake.test_var, "CAF_IO_TEST_SOURCES");
    assert_eq!(cmake.test_marker, "set(CAF_IO_TEST_SOURCES");
    assert_eq!(cmake.test_path, PathBuf::from("test/io/basp/header.cpp"));
    assert_eq!(cmake.test_suite, None);
}

#[test]
fn test_tenzir_layout() {
    let paths = resolver(Profile::tenzir())
        .resolve_paths(Path::new("/r"), "tenzir::detail::Foo", None)
        .unwrap();

    assert_eq!(paths.component, "libtenzir");
    assert_eq!(paths.header, PathBuf::from("/r/core/tenzir/detail/Foo.hpp"));
    assert_eq!(paths.source, PathBuf::from("/r/core/src/detail/Foo.cpp"));
    assert_eq!(paths.test, PathBuf::from("/r/core/test/detail/Foo.cpp"));
    assert_eq!(paths.cmake.file, PathBuf::from("/r/core/CMakeLists.txt"));
    assert_eq!(paths.cmake.source_var, "libtenzir_sources");
    assert_eq!(paths.cmake.test_var, "tests");
    assert_eq!(paths.cmake.test_path, PathBuf::from("test/detail/Foo.cpp"));
}

#[rstest]
#[case("caf::actor", "caf/libcaf_core")]
#[case("caf::io::middleman", "caf/libcaf_io")]
#[case("caf::openssl::session", "caf/libcaf_openssl")]
#[case("caf::bb::tokenized_integer_reader", "incubator/libcaf_bb")]
#[case("caf::net::multiplexer", "incubator/libcaf_net")]
fn test_caf_component_dirs(#[case] name: &str, #[case] dir: &str) {
    let paths = resolver(Profile::caf())
        .resolve_paths(Path::new("/r"), name, None)
        .unwrap();
    let expected = Path::new("/r").join(dir).join("CMakeLists.txt");
    assert_eq!(paths.cmake.file, expected);
}

#[rstest]
#[case(Profile::broker(), "broker::Foo", "src/Foo.cc")]
#[case(Profile::caf(), "caf::Foo", "src/Foo.cpp")]
#[case(Profile::tenzir(), "tenzir::Foo", "src/Foo.cpp")]
fn test_top_level_class(#[case] profile: Profile, #[case] name: &str, #[case] source: &str) {
    let paths = resolver(profile)
        .resolve_paths(Path::new("root"), name, None)
        .unwrap();
    assert_eq!(paths.cmake.source_path, PathBuf::from(source));
}

#[test]
fn test_relative_root() {
    let paths = resolver(Profile::broker())
        .resolve_paths(Path::new("."), "broker::Foo", None)
        .unwrap();
    assert_eq!(paths.header, PathBuf::from("./broker/include/broker/Foo.hh"));
}

#[test]
fn test_caf_replacements() {
    let map = resolver(Profile::caf())
        .resolve_replacements("caf::io::Foo")
        .unwrap();

    assert_eq!(map.len(), 7);
    assert_eq!(map.text(keys::CLASS), Some("Foo"));
    assert_eq!(map.text(keys::QUALIFIED_CLASS), Some("io.Foo"));
    assert_eq!(map.text(keys::NAMESPACE), Some("caf::io"));
    assert_eq!(map.text(keys::HEADER), Some("caf/io/Foo.hpp"));
    assert_eq!(map.get(keys::YEAR), Some(&ReplacementValue::Integer(2021)));
    assert_eq!(
        map.text(keys::NAMESPACE_OPEN),
        Some("namespace caf {\nnamespace io {")
    );
    assert_eq!(
        map.text(keys::NAMESPACE_CLOSE),
        Some("} // namespace io\n} // namespace caf")
    );
}

#[test]
fn test_broker_replacements() {
    let map = resolver(Profile::broker())
        .resolve_replacements("broker::detail::Foo")
        .unwrap();
    assert_eq!(map.text(keys::HEADER), Some("broker/detail/Foo.hh"));
    assert_eq!(map.text(keys::QUALIFIED_CLASS), Some("detail.Foo"));
    assert!(!map.contains(keys::HEADER_GUARD));
}

#[test]
fn test_tenzir_replacements() {
    let map = resolver(Profile::tenzir())
        .resolve_replacements("tenzir::Foo")
        .unwrap();
    let keys: Vec<_> = map.iter().map(|(k, _)| k).collect();
    assert_eq!(
        keys,
        ["class", "header-guard", "hpp", "namespace", "namespace-close", "namespace-open"]
    );
    assert_eq!(map.text("header-guard"), Some("TENZIR_FOO_HPP"));
    assert_eq!(map.text("namespace-open"), Some("namespace tenzir {"));
}

#[rstest]
#[case(Profile::broker(), "caf::Foo")]
#[case(Profile::caf(), "broker::Foo")]
#[case(Profile::tenzir(), "Foo")]
#[case(Profile::tenzir(), "tenzir")]
#[case(Profile::caf(), "caf::")]
#[case(Profile::caf(), "")]
#[case(Profile::caf(), "caf::/etc::passwd")]
#[case(Profile::caf(), "caf:::Foo")]
#[case(Profile::caf(), "caf::..::..::Foo")]
#[case(Profile::caf(), "caf::io::Fo/o")]
#[case(Profile::broker(), "broker::detail::Foo.hh")]
fn test_invalid_names(#[case] profile: Profile, #[case] name: &str) {
    let resolver = resolver(profile);
    assert!(matches!(
        resolver.resolve_paths(Path::new("/r"), name, None),
        Err(CoreError::InvalidQualifiedName { .. })
    ));
    assert!(matches!(
        resolver.resolve_replacements(name),
        Err(CoreError::InvalidQualifiedName { .. })
    ));
}

#[test]
fn test_absolute_segment_cannot_escape_root() {
    let err = resolver(Profile::caf())
        .resolve_paths(Path::new("/r"), "caf::/etc::passwd", None)
        .unwrap_err();
    assert!(err.to_string().contains("segment 2 (\"/etc\") is not an identifier"));
}

#[test]
fn test_paths_serialize_for_driver() {
    let paths = resolver(Profile::broker())
        .resolve_paths(Path::new("/r"), "broker::Foo", None)
        .unwrap();
    let json = serde_json::to_value(&paths).unwrap();
    assert_eq!(json["header"], "/r/broker/include/broker/Foo.hh");
    assert_eq!(json["cmake"]["source_marker"], "set(BROKER_SRC");
    assert_eq!(json["cmake"]["test_suite"], "cpp/Foo.cc");
}

#[test]
fn test_resolver_is_shareable() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Resolver>();
}
