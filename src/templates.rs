//! Instalación de los planes terraform en un directorio escribible.
//!
//! El paquete trae los planes en `<snap>/etc/<plan>`, que es de sólo lectura;
//! terraform necesita escribir junto a ellos, así que se copian a
//! `<snap_common>/etc/<plan>` sobrescribiendo lo que hubiera.
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::debug;

pub const PLAN_TEMPLATES: [&str; 2] = ["deploy-microk8s", "deploy-openstack"];

/// Copia cada plan de `PLAN_TEMPLATES` y devuelve los destinos.
pub fn install_plan_templates(snap_dir: &Path, snap_common: &Path) -> io::Result<Vec<PathBuf>> {
    PLAN_TEMPLATES.iter()
                  .map(|plan| {
                      let src = snap_dir.join("etc").join(plan);
                      let dst = snap_common.join("etc").join(plan);
                      debug!("Updating {} from {}...", dst.display(), src.display());
                      copy_tree(&src, &dst)?;
                      Ok(dst)
                  })
                  .collect()
}

/// Copia recursiva; los directorios destino existentes se reutilizan.
pub fn copy_tree(src: &Path, dst: &Path) -> io::Result<()> {
    if !src.is_dir() {
        return Err(io::Error::new(io::ErrorKind::NotFound, format!("template directory {} not found", src.display())));
    }
    fs::create_dir_all(dst)?;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let target = dst.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_tree(&entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copies_plans_and_overwrites() {
        let snap = tempfile::tempdir().unwrap();
        let common = tempfile::tempdir().unwrap();
        for plan in PLAN_TEMPLATES {
            let dir = snap.path().join("etc").join(plan).join("modules");
            fs::create_dir_all(&dir).unwrap();
            fs::write(snap.path().join("etc").join(plan).join("main.tf"), plan).unwrap();
            fs::write(dir.join("mod.tf"), "module").unwrap();
        }
        let stale = common.path().join("etc/deploy-microk8s");
        fs::create_dir_all(&stale).unwrap();
        fs::write(stale.join("main.tf"), "old").unwrap();

        let installed = install_plan_templates(snap.path(), common.path()).unwrap();
        assert_eq!(installed.len(), 2);
        assert_eq!(fs::read_to_string(stale.join("main.tf")).unwrap(), "deploy-microk8s");
        assert!(common.path().join("etc/deploy-openstack/modules/mod.tf").exists());
    }

    #[test]
    fn missing_template_is_not_found() {
        let snap = tempfile::tempdir().unwrap();
        let common = tempfile::tempdir().unwrap();
        let err = install_plan_templates(snap.path(), common.path()).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
