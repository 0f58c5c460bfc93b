//! Command catalog — static intent → command-template mapping.
//!
//! Loaded once at process start and immutable afterwards. The builtin
//! table covers file/folder operations, process control, system
//! queries, and a git subset; a JSON loader supports external
//! catalogs with the same schema.

use ahash::AHashMap;
use regex::Regex;
use std::sync::LazyLock;

use nl_protocol::{
    Bindings, Intent, ParameterSlot, PlatformTag, ResolveError, SlotKind,
};

static RE_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([a-z_]+)\}").unwrap());

/// Immutable intent catalog with O(1) lookup by id.
#[derive(Debug, Clone)]
pub struct CommandCatalog {
    intents: Vec<Intent>,
    index: AHashMap<String, usize>,
}

impl CommandCatalog {
    /// Build a catalog, rejecting duplicate intent ids.
    pub fn new(intents: Vec<Intent>) -> Result<Self, ResolveError> {
        let mut index = AHashMap::with_capacity(intents.len());
        for (i, intent) in intents.iter().enumerate() {
            if index.insert(intent.id.clone(), i).is_some() {
                return Err(ResolveError::Catalog(format!(
                    "duplicate intent id: {}",
                    intent.id
                )));
            }
        }
        Ok(Self { intents, index })
    }

    /// Load a catalog from a JSON file containing an array of intents.
    pub fn from_json_file(path: &str) -> Result<Self, ResolveError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ResolveError::Catalog(format!("read {path}: {e}")))?;
        let intents: Vec<Intent> = serde_json::from_str(&contents)
            .map_err(|e| ResolveError::Catalog(format!("parse {path}: {e}")))?;
        Self::new(intents)
    }

    pub fn get(&self, id: &str) -> Option<&Intent> {
        self.index.get(id).map(|&i| &self.intents[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Intent> {
        self.intents.iter()
    }

    pub fn len(&self) -> usize {
        self.intents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intents.is_empty()
    }

    /// The builtin catalog. Infallible: the table below has no
    /// duplicate ids, which `builtin_intents` tests enforce.
    pub fn builtin() -> Self {
        Self::new(builtin_intents()).expect("builtin catalog is well-formed")
    }
}

/// Substitute `{placeholder}` tokens in a command template.
///
/// Errors with the first unfilled placeholder name, so callers can
/// report which slot was missing.
pub fn render_template(template: &str, bindings: &Bindings) -> Result<String, String> {
    let mut rendered = template.to_string();
    for (name, value) in bindings {
        rendered = rendered.replace(&format!("{{{name}}}"), value);
    }
    if let Some(caps) = RE_PLACEHOLDER.captures(&rendered) {
        return Err(caps[1].to_string());
    }
    Ok(rendered)
}

fn builtin_intents() -> Vec<Intent> {
    use PlatformTag::Both;
    use SlotKind::{FreeText, Path, ProcessName, Url};

    vec![
        // ── File and folder operations ──────────────────────────
        Intent::new("create_file", Both)
            .phrase("create file {filename}")
            .phrase("create a file named {filename}")
            .phrase("create a file called {filename}")
            .phrase("make a file named {filename}")
            .phrase("make file {filename}")
            .phrase("new file {filename}")
            .slot(ParameterSlot::required("filename", Path))
            .windows_cmd("echo. > {filename}")
            .linux_cmd("touch {filename}"),
        Intent::new("create_file_with_content", Both)
            .phrase("create file {filename} with content {content}")
            .phrase("create a file named {filename} with content {content}")
            .slot(ParameterSlot::required("filename", Path))
            .slot(ParameterSlot::required("content", FreeText))
            .windows_cmd("echo {content} > {filename}")
            .linux_cmd("echo \"{content}\" > {filename}"),
        Intent::new("create_folder", Both)
            .phrase("create folder {foldername}")
            .phrase("create a folder named {foldername}")
            .phrase("create a folder called {foldername}")
            .phrase("create directory {foldername}")
            .phrase("make a directory called {foldername}")
            .phrase("make directory {foldername}")
            .phrase("new folder {foldername}")
            .slot(ParameterSlot::required("foldername", Path))
            .windows_cmd("mkdir {foldername}")
            .linux_cmd("mkdir {foldername}"),
        Intent::new("delete_file", Both)
            .phrase("delete file {filename}")
            .phrase("delete the file {filename}")
            .phrase("remove file {filename}")
            .slot(ParameterSlot::required("filename", Path))
            .windows_cmd("del {filename}")
            .linux_cmd("rm {filename}"),
        Intent::new("delete_folder", Both)
            .phrase("delete folder {foldername}")
            .phrase("delete directory {foldername}")
            .phrase("remove directory {foldername}")
            .phrase("remove folder {foldername}")
            .slot(ParameterSlot::required("foldername", Path))
            .windows_cmd("rmdir {foldername}")
            .linux_cmd("rmdir {foldername}"),
        Intent::new("rename_file", Both)
            .phrase("rename file {old_name} to {new_name}")
            .phrase("rename {old_name} to {new_name}")
            .slot(ParameterSlot::required("old_name", Path))
            .slot(ParameterSlot::required("new_name", Path))
            .windows_cmd("ren {old_name} {new_name}")
            .linux_cmd("mv {old_name} {new_name}"),
        Intent::new("copy_file", Both)
            .phrase("copy file {source} to {destination}")
            .phrase("copy {source} to {destination}")
            .slot(ParameterSlot::required("source", Path))
            .slot(ParameterSlot::required("destination", Path))
            .windows_cmd("copy {source} {destination}")
            .linux_cmd("cp {source} {destination}"),
        Intent::new("find_files", Both)
            .phrase("find files named {pattern}")
            .phrase("find file {pattern}")
            .phrase("search for files named {pattern}")
            .slot(ParameterSlot::required("pattern", Path))
            .windows_cmd("dir /s /b {pattern}")
            .linux_cmd("find . -name \"{pattern}\""),
        Intent::new("list_files", Both)
            .phrase("list all files")
            .phrase("list files")
            .phrase("show all files")
            .phrase("show files in {path}")
            .slot(ParameterSlot::optional("path", Path, "."))
            .windows_cmd("dir {path}")
            .linux_cmd("ls -la {path}"),
        // ── Processes and system queries ────────────────────────
        Intent::new("kill_process", Both)
            .phrase("kill process {process}")
            .phrase("kill {process}")
            .phrase("stop process {process}")
            .phrase("terminate process {process}")
            .phrase("close {process}")
            .slot(ParameterSlot::required("process", ProcessName))
            .windows_cmd("taskkill /IM {process}.exe /F")
            .linux_cmd("pkill {process}"),
        Intent::new("list_processes", Both)
            .phrase("list processes")
            .phrase("list all processes")
            .phrase("show running processes")
            .windows_cmd("tasklist")
            .linux_cmd("ps aux"),
        Intent::new("system_info", Both)
            .phrase("show system information")
            .phrase("show system info")
            .phrase("display system information")
            .phrase("system information")
            .windows_cmd("systeminfo")
            .linux_cmd("uname -a"),
        Intent::new("ip_address", Both)
            .phrase("get my ip address")
            .phrase("show ip address")
            .phrase("what is my ip")
            .phrase("display ip address")
            .windows_cmd("ipconfig")
            .linux_cmd("ip addr show"),
        Intent::new("disk_space", Both)
            .phrase("check disk space")
            .phrase("show disk space")
            .phrase("how much disk space is left")
            .windows_cmd("wmic logicaldisk get size,freespace,caption")
            .linux_cmd("df -h"),
        Intent::new("clean_temp", Both)
            .phrase("clean temporary files")
            .phrase("clean temp files")
            .phrase("clear temp files")
            .windows_cmd("del /q /f %temp%\\*")
            .linux_cmd("rm -f /tmp/*"),
        Intent::new("ping_host", Both)
            .phrase("ping {host}")
            .phrase("ping host {host}")
            .phrase("check connection to {host}")
            .slot(ParameterSlot::required("host", Path))
            .windows_cmd("ping {host}")
            .linux_cmd("ping -c 4 {host}"),
        // ── Git (cross-platform) ────────────────────────────────
        Intent::new("git_status", Both)
            .phrase("git status")
            .phrase("check git status")
            .phrase("show git status")
            .windows_cmd("git status")
            .linux_cmd("git status"),
        Intent::new("git_init", Both)
            .phrase("git init")
            .phrase("initialize git")
            .phrase("initialize git repository")
            .phrase("create git repo")
            .windows_cmd("git init")
            .linux_cmd("git init"),
        Intent::new("git_add_all", Both)
            .phrase("git add all")
            .phrase("stage all changes")
            .phrase("add all files to git")
            .windows_cmd("git add .")
            .linux_cmd("git add ."),
        Intent::new("git_commit", Both)
            .phrase("git commit")
            .phrase("commit changes")
            .phrase("commit the changes")
            .phrase("make a commit")
            .phrase("commit changes with message {message}")
            .slot(ParameterSlot::optional("message", FreeText, "Update"))
            .windows_cmd("git commit -m \"{message}\"")
            .linux_cmd("git commit -m \"{message}\""),
        Intent::new("git_push", Both)
            .phrase("git push")
            .phrase("push changes")
            .phrase("push to remote")
            .phrase("upload to github")
            .windows_cmd("git push")
            .linux_cmd("git push"),
        Intent::new("git_pull", Both)
            .phrase("git pull")
            .phrase("pull changes")
            .phrase("pull from github")
            .phrase("get latest changes")
            .windows_cmd("git pull")
            .linux_cmd("git pull"),
        Intent::new("git_clone", Both)
            .phrase("git clone {url}")
            .phrase("clone repository {url}")
            .phrase("clone repo {url}")
            .slot(ParameterSlot::required("url", Url))
            .windows_cmd("git clone {url}")
            .linux_cmd("git clone {url}"),
        Intent::new("git_create_branch", Both)
            .phrase("create branch {branchname}")
            .phrase("create a new branch named {branchname}")
            .phrase("make a new branch {branchname}")
            .slot(ParameterSlot::required("branchname", Path))
            .windows_cmd("git branch {branchname}")
            .linux_cmd("git branch {branchname}"),
        Intent::new("git_checkout", Both)
            .phrase("checkout branch {branchname}")
            .phrase("switch to branch {branchname}")
            .phrase("change branch to {branchname}")
            .slot(ParameterSlot::required("branchname", Path))
            .windows_cmd("git checkout {branchname}")
            .linux_cmd("git checkout {branchname}"),
        Intent::new("git_list_branches", Both)
            .phrase("list branches")
            .phrase("show all branches")
            .phrase("git branch")
            .windows_cmd("git branch")
            .linux_cmd("git branch"),
        Intent::new("git_log", Both)
            .phrase("git log")
            .phrase("show commit history")
            .phrase("view commit log")
            .windows_cmd("git log --oneline")
            .linux_cmd("git log --oneline"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use nl_protocol::Platform;

    #[test]
    fn builtin_ids_are_unique() {
        // CommandCatalog::new errors on duplicates, so this is the guard.
        let catalog = CommandCatalog::builtin();
        assert!(catalog.len() >= 20);
    }

    #[test]
    fn lookup_by_id() {
        let catalog = CommandCatalog::builtin();
        let intent = catalog.get("kill_process").unwrap();
        assert_eq!(intent.template_for(Platform::Windows), Some("taskkill /IM {process}.exe /F"));
        assert!(catalog.get("no_such_intent").is_none());
    }

    #[test]
    fn duplicate_ids_rejected() {
        let intents = vec![
            Intent::new("dup", PlatformTag::Both).phrase("a"),
            Intent::new("dup", PlatformTag::Both).phrase("b"),
        ];
        assert!(matches!(
            CommandCatalog::new(intents),
            Err(ResolveError::Catalog(_))
        ));
    }

    #[test]
    fn render_fills_placeholders() {
        let mut bindings = Bindings::new();
        bindings.insert("process".into(), "firefox".into());
        let rendered = render_template("taskkill /IM {process}.exe /F", &bindings).unwrap();
        assert_eq!(rendered, "taskkill /IM firefox.exe /F");
    }

    #[test]
    fn render_reports_missing_placeholder() {
        let bindings = Bindings::new();
        let err = render_template("mkdir {foldername}", &bindings).unwrap_err();
        assert_eq!(err, "foldername");
    }

    #[test]
    fn every_builtin_intent_has_both_templates() {
        let catalog = CommandCatalog::builtin();
        for intent in catalog.iter() {
            assert!(
                intent.template_for(Platform::Windows).is_some(),
                "{} missing windows template",
                intent.id
            );
            assert!(
                intent.template_for(Platform::Linux).is_some(),
                "{} missing linux template",
                intent.id
            );
        }
    }

    #[test]
    fn json_catalog_loads() {
        let json = r#"[
            {
                "id": "shutdown_timer",
                "phrasings": ["shut down in {number} seconds"],
                "slots": [{"name": "number", "kind": "number", "required": true}],
                "platform": "windows",
                "windows": "shutdown /s /t {number}"
            }
        ]"#;
        let intents: Vec<Intent> = serde_json::from_str(json).unwrap();
        let catalog = CommandCatalog::new(intents).unwrap();
        assert_eq!(
            catalog.get("shutdown_timer").unwrap().template_for(Platform::Windows),
            Some("shutdown /s /t {number}")
        );
    }
}
