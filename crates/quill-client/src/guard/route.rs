// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Route records and path matching.

use std::collections::BTreeMap;

use percent_encoding::percent_decode_str;

// =============================================================================
// RouteMeta
// =============================================================================

/// Access rules and title of a route record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteMeta {
    /// Page title.
    pub title: Option<String>,
    /// Only signed-in users may enter.
    pub requires_auth: bool,
    /// Only signed-out users may enter.
    pub guest: bool,
    /// Only administrators may enter.
    pub requires_admin: bool,
}

impl RouteMeta {
    /// Creates empty metadata.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Requires a signed-in user.
    pub fn requires_auth(mut self) -> Self {
        self.requires_auth = true;
        self
    }

    /// Restricts to signed-out users.
    pub fn guest(mut self) -> Self {
        self.guest = true;
        self
    }

    /// Requires an administrator. Implies `requires_auth`.
    pub fn requires_admin(mut self) -> Self {
        self.requires_auth = true;
        self.requires_admin = true;
        self
    }
}

// =============================================================================
// Route
// =============================================================================

/// A route record, optionally with nested children.
///
/// Child paths starting with `/` are absolute; others are relative to the
/// parent. `:name` matches one segment and `:name(.*)*` matches the rest of
/// the path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    /// Path pattern.
    pub path: String,
    /// Route name.
    pub name: Option<String>,
    /// Metadata.
    pub meta: RouteMeta,
    /// Nested records.
    pub children: Vec<Route>,
}

impl Route {
    /// Creates a named route.
    pub fn new(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: Some(name.into()),
            meta: RouteMeta::default(),
            children: Vec::new(),
        }
    }

    /// Creates an unnamed layout record holding `children`.
    pub fn layout(path: impl Into<String>, children: Vec<Route>) -> Self {
        Self {
            path: path.into(),
            name: None,
            meta: RouteMeta::default(),
            children,
        }
    }

    /// Sets the metadata.
    pub fn meta(mut self, meta: RouteMeta) -> Self {
        self.meta = meta;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Static(String),
    Param(String),
    CatchAll(String),
}

fn compile(pattern: &str) -> Vec<Segment> {
    pattern
        .split('/')
        .filter(|s| !s.is_empty())
        .map(|s| match s.strip_prefix(':') {
            Some(param) => match param.split_once('(') {
                Some((name, rest)) if rest.ends_with('*') => Segment::CatchAll(name.to_string()),
                Some((name, _)) => Segment::Param(name.to_string()),
                None => Segment::Param(param.to_string()),
            },
            None => Segment::Static(s.to_string()),
        })
        .collect()
}

fn join(parent: &str, child: &str) -> String {
    if child.starts_with('/') {
        child.to_string()
    } else if child.is_empty() {
        parent.to_string()
    } else {
        format!("{}/{}", parent.trim_end_matches('/'), child)
    }
}

/// A leaf record with its ancestors, compiled for matching.
#[derive(Debug, Clone)]
struct Entry {
    name: Option<String>,
    pattern: String,
    segments: Vec<Segment>,
    chain: Vec<RouteMeta>,
}

impl Entry {
    fn is_catch_all(&self) -> bool {
        matches!(self.segments.last(), Some(Segment::CatchAll(_)))
    }

    fn matches(&self, parts: &[&str]) -> Option<BTreeMap<String, String>> {
        let mut params = BTreeMap::new();
        let mut i = 0;

        for segment in &self.segments {
            match segment {
                Segment::Static(expected) => {
                    let part = parts.get(i)?;
                    if !part.eq_ignore_ascii_case(expected) {
                        return None;
                    }
                    i += 1;
                }
                Segment::Param(name) => {
                    let part = parts.get(i)?;
                    params.insert(name.clone(), decode(part));
                    i += 1;
                }
                Segment::CatchAll(name) => {
                    let rest: Vec<String> = parts[i..].iter().map(|p| decode(p)).collect();
                    params.insert(name.clone(), rest.join("/"));
                    i = parts.len();
                }
            }
        }

        (i == parts.len()).then_some(params)
    }
}

fn decode(s: &str) -> String {
    percent_decode_str(s).decode_utf8_lossy().into_owned()
}

// =============================================================================
// RouteMatch
// =============================================================================

/// A resolved navigation target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    /// Name of the matched leaf record.
    pub name: Option<String>,
    /// Pattern of the matched leaf record.
    pub pattern: String,
    /// Requested path without query.
    pub path: String,
    /// Requested path with query, as given.
    pub full_path: String,
    /// Path parameters.
    pub params: BTreeMap<String, String>,
    /// Decoded query parameters, in order.
    pub query: Vec<(String, String)>,
    /// Metadata of every matched record, outermost first.
    pub matched: Vec<RouteMeta>,
}

impl RouteMatch {
    /// Returns `true` if any matched record requires a signed-in user.
    pub fn requires_auth(&self) -> bool {
        self.matched.iter().any(|m| m.requires_auth)
    }

    /// Returns `true` if any matched record is guest-only.
    pub fn is_guest_only(&self) -> bool {
        self.matched.iter().any(|m| m.guest)
    }

    /// Returns `true` if any matched record requires an administrator.
    pub fn requires_admin(&self) -> bool {
        self.matched.iter().any(|m| m.requires_admin)
    }

    /// Returns the title of the innermost record that has one.
    pub fn title(&self) -> Option<&str> {
        self.matched.iter().rev().find_map(|m| m.title.as_deref())
    }

    /// Returns a query parameter.
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

// =============================================================================
// RouteTable
// =============================================================================

/// Ordered route records.
///
/// Specific routes win over catch-all routes; otherwise the first declared
/// match wins.
#[derive(Debug, Clone)]
pub struct RouteTable {
    entries: Vec<Entry>,
}

impl RouteTable {
    /// Compiles a route tree.
    pub fn new(routes: Vec<Route>) -> Self {
        let mut entries = Vec::new();
        for route in &routes {
            flatten(route, "", &[], &mut entries);
        }
        Self { entries }
    }

    /// The blog's routes.
    pub fn blog_default() -> Self {
        Self::new(vec![Route::layout(
            "/",
            vec![
                Route::new("", "Home").meta(RouteMeta::new().title("Home")),
                Route::new("/login", "Login").meta(RouteMeta::new().title("Sign In").guest()),
                Route::new("/register", "Register")
                    .meta(RouteMeta::new().title("Register").guest()),
                Route::new("/about", "About").meta(RouteMeta::new().title("About Me")),
                Route::new("/articles", "ArticleList").meta(RouteMeta::new().title("Articles")),
                Route::new("/article/:id", "ArticleDetail")
                    .meta(RouteMeta::new().title("Article")),
                Route::new("/settings", "Settings")
                    .meta(RouteMeta::new().title("Settings").requires_auth()),
                Route::new("/profile", "Profile")
                    .meta(RouteMeta::new().title("Profile").requires_auth()),
                Route::new("/admin", "Admin")
                    .meta(RouteMeta::new().title("Admin Dashboard").requires_admin()),
                Route::new("/403", "Forbidden").meta(RouteMeta::new().title("Access Denied")),
                Route::new("/:pathMatch(.*)*", "NotFound")
                    .meta(RouteMeta::new().title("Page Not Found")),
            ],
        )])
    }

    /// Returns the number of leaf routes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolves `full_path` (path plus optional query and fragment).
    pub fn resolve(&self, full_path: &str) -> Option<RouteMatch> {
        let without_fragment = full_path.split('#').next().unwrap_or_default();
        let (path, query) = match without_fragment.split_once('?') {
            Some((path, query)) => (path, query),
            None => (without_fragment, ""),
        };
        let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        let entry_match = self
            .entries
            .iter()
            .filter(|e| !e.is_catch_all())
            .chain(self.entries.iter().filter(|e| e.is_catch_all()))
            .find_map(|e| e.matches(&parts).map(|params| (e, params)))?;

        let (entry, params) = entry_match;
        Some(RouteMatch {
            name: entry.name.clone(),
            pattern: entry.pattern.clone(),
            path: if path.is_empty() { "/".to_string() } else { path.to_string() },
            full_path: full_path.to_string(),
            params,
            query: parse_query(query),
            matched: entry.chain.clone(),
        })
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::blog_default()
    }
}

fn flatten(route: &Route, parent: &str, chain: &[RouteMeta], out: &mut Vec<Entry>) {
    let pattern = join(parent, &route.path);
    let mut chain = chain.to_vec();
    chain.push(route.meta.clone());

    if route.children.is_empty() {
        out.push(Entry {
            name: route.name.clone(),
            segments: compile(&pattern),
            pattern,
            chain,
        });
    } else {
        for child in &route.children {
            flatten(child, &pattern, &chain, out);
        }
    }
}

fn parse_query(query: &str) -> Vec<(String, String)> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
            (decode(&k.replace('+', " ")), decode(&v.replace('+', " ")))
        })
        .collect()
}
