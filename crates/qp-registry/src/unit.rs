use super::*;

/// A type declared at unit scope and its callable members.
///
/// Only direct members are tracked; members of nested types are out of
/// reach of the collector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDecl {
    unit: String,
    name: String,
    members: Vec<CallSite>,
}

impl TypeDecl {
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn members(&self) -> &[CallSite] {
        &self.members
    }
    /// Finds or declares the member call site with this name.
    pub fn member(&mut self, name: &str) -> &mut CallSite {
        let path = SitePath::method(&self.unit, &self.name, name);
        let i = match self.members.iter().position(|m| m.path() == &path) {
            Some(i) => i,
            None => {
                self.members.push(CallSite::new(path));
                self.members.len() - 1
            }
        };
        &mut self.members[i]
    }
}

/// A unit-scope entity, kept in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item {
    Function(CallSite),
    Type(TypeDecl),
}

/// One loaded module: the free functions and types declared at its scope.
///
/// Entities are looked up by name before being created, so loading the
/// same declarations into a unit twice leaves it unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeUnit {
    name: String,
    items: Vec<Item>,
}

impl CodeUnit {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            items: Vec::new(),
        }
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn items(&self) -> &[Item] {
        &self.items
    }
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
    /// Finds or declares the free function with this name.
    pub fn function(&mut self, name: &str) -> &mut CallSite {
        let path = SitePath::function(&self.name, name);
        let found = self.items.iter().position(|item| match item {
            Item::Function(site) => site.path() == &path,
            Item::Type(_) => false,
        });
        let i = match found {
            Some(i) => i,
            None => {
                self.items.push(Item::Function(CallSite::new(path)));
                self.items.len() - 1
            }
        };
        match &mut self.items[i] {
            Item::Function(site) => site,
            Item::Type(_) => unreachable!("position matched a function"),
        }
    }
    /// Finds or declares the type with this name.
    pub fn ty(&mut self, name: &str) -> &mut TypeDecl {
        let found = self.items.iter().position(|item| match item {
            Item::Type(decl) => decl.name == name,
            Item::Function(_) => false,
        });
        let i = match found {
            Some(i) => i,
            None => {
                self.items.push(Item::Type(TypeDecl {
                    unit: self.name.clone(),
                    name: name.to_string(),
                    members: Vec::new(),
                }));
                self.items.len() - 1
            }
        };
        match &mut self.items[i] {
            Item::Type(decl) => decl,
            Item::Function(_) => unreachable!("position matched a type"),
        }
    }
    /// Every callable reachable from this unit, in declaration order:
    /// free functions and the direct members of each type.
    pub fn call_sites(&self) -> impl Iterator<Item = &CallSite> {
        self.items.iter().flat_map(|item| match item {
            Item::Function(site) => std::slice::from_ref(site),
            Item::Type(decl) => decl.members.as_slice(),
        })
    }
}
