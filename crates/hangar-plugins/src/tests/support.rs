//! Archive builders and sample services shared by the unit tests.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use hangar_sdk::{CapabilityContract, DemoContract, DemoService, Registrar, ServiceObject};
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Descriptor path used by the default settings.
pub(crate) const DESCRIPTOR: &str = "META-INF/hangar.factories";

/// Writes a ZIP archive called `file_name` holding `entries`.
pub(crate) fn write_archive(dir: &Path, file_name: &str, entries: &[(&str, &str)]) -> PathBuf {
    let path = dir.join(file_name);
    let file = File::create(&path).expect("create archive file");
    let mut writer = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    for (name, content) in entries {
        writer.start_file(*name, options).expect("start entry");
        writer.write_all(content.as_bytes()).expect("write entry");
    }
    writer.finish().expect("finish archive");
    path
}

/// Writes an archive whose only descriptor line is `descriptor`.
pub(crate) fn write_plugin(dir: &Path, file_name: &str, descriptor: &str) -> PathBuf {
    write_archive(dir, file_name, &[(DESCRIPTOR, descriptor)])
}

/// Writes an archive carrying junk platform libraries under `lib/`.
pub(crate) fn archive_with_library(dir: &Path, file_name: &str, stems: &[&str]) -> PathBuf {
    let names: Vec<String> = stems
        .iter()
        .map(|stem| format!("lib/{stem}{}", std::env::consts::DLL_SUFFIX))
        .collect();
    let entries: Vec<(&str, &str)> = names
        .iter()
        .map(|name| (name.as_str(), "not a shared object"))
        .collect();
    write_archive(dir, file_name, &entries)
}

/// Demo service that prefixes messages with a fixed tag.
pub(crate) struct Tagged(pub(crate) &'static str);

impl DemoService for Tagged {
    fn demo_test(&self, message: &str) -> String {
        format!("{}: {message}", self.0)
    }
}

fn tagged(tag: &'static str) -> ServiceObject {
    ServiceObject::new::<DemoContract>(Box::new(Tagged(tag)))
}

/// Registers `com.x.Impl` as the `alpha` service.
pub(crate) fn register_alpha(registrar: &mut dyn Registrar) {
    registrar.register("com.x.Impl", || Ok(tagged("alpha")));
}

/// Registers `com.x.Impl` as the `beta` service.
pub(crate) fn register_beta(registrar: &mut dyn Registrar) {
    registrar.register("com.x.Impl", || Ok(tagged("beta")));
}

/// Registers implementations `A` and `B`.
pub(crate) fn register_pair(registrar: &mut dyn Registrar) {
    registrar.register("A", || Ok(tagged("A")));
    registrar.register("B", || Ok(tagged("B")));
}

/// Registers implementations that fail in every supported way.
pub(crate) fn register_faulty(registrar: &mut dyn Registrar) {
    registrar.register("com.x.Fails", || Err("resource unavailable".into()));
    registrar.register("com.x.Panics", || panic!("constructor exploded"));
    registrar.register("com.x.Clock", || {
        Ok(ServiceObject::new::<ClockContract>(Box::new(FixedClock)))
    });
    registrar.register("com.x.Works", || Ok(tagged("works")));
}

/// Counts constructions of `lazy.Second`.
pub(crate) static LAZY_SECOND_BUILT: AtomicUsize = AtomicUsize::new(0);

/// Registers `lazy.First` and a counted `lazy.Second`.
pub(crate) fn register_lazy(registrar: &mut dyn Registrar) {
    registrar.register("lazy.First", || Ok(tagged("first")));
    registrar.register("lazy.Second", || {
        LAZY_SECOND_BUILT.fetch_add(1, Ordering::SeqCst);
        Ok(tagged("second"))
    });
}

/// A contract unrelated to `DemoService`.
pub(crate) trait Clock {
    fn now(&self) -> u64;
}

/// Contract marker for [`Clock`].
pub(crate) struct ClockContract;

impl CapabilityContract for ClockContract {
    const ID: &'static str = "Clock";
    type Service = dyn Clock;
}

struct FixedClock;

impl Clock for FixedClock {
    fn now(&self) -> u64 {
        42
    }
}

/// Invokes every service with `message`.
pub(crate) fn outputs<'a, I>(instances: I, message: &str) -> Vec<String>
where
    I: IntoIterator<Item = &'a crate::instantiate::ServiceInstance<DemoContract>>,
{
    instances
        .into_iter()
        .map(|instance| instance.demo_test(message))
        .collect()
}
