//! Tables and views managed by the pipeline and their shared lifecycle.

use tracing::{debug, info};

use super::{populate, Inputs};
use crate::error::{Action, Error, Result};
use crate::gateway::Gateway;
use crate::schema::ddl::{generate_create_table, generate_create_view, table_definition};
use crate::schema::{
    ObjectKind, TableSchema, ViewSchema, DOMAIN, MAPPING, TLD, TOP_10_REPEATED_DOMAINS,
    TOP_10_TLDS, TOP_10_URLS, URL, URL_TEMP,
};

/// Create-or-replace lifecycle shared by every table and view.
pub trait SchemaObject {
    fn name(&self) -> &'static str;

    fn kind(&self) -> ObjectKind;

    /// Column list for a table, SELECT statement for a view
    fn definition(&self) -> String;

    fn is_temporary(&self) -> bool {
        false
    }

    /// Fill the freshly created object, returning the number of rows inserted
    fn populate(&self, gateway: &mut Gateway, inputs: &Inputs) -> Result<u64>;

    /// Which existing catalog kinds count as "already there"
    fn replaces(&self) -> Option<ObjectKind> {
        None
    }

    fn create(&self, gateway: &Gateway) -> Result<()> {
        let sql = match self.kind() {
            ObjectKind::Table => {
                generate_create_table(self.name(), &self.definition(), self.is_temporary())
            }
            ObjectKind::View => generate_create_view(self.name(), &self.definition()),
        };

        debug!(name = self.name(), %sql, "create");
        gateway
            .execute(&sql)
            .map_err(|e| Error::for_object(self.name(), Action::Create, e))?;
        Ok(())
    }

    /// Drop the object (cascading to dependents) if it exists, then create it
    fn initialise(&self, gateway: &Gateway) -> Result<()> {
        let existing = gateway
            .find_object(self.name())?
            .filter(|entry| self.replaces().map_or(true, |kind| kind == entry.kind));

        if let Some(entry) = existing {
            info!(name = self.name(), kind = %entry.kind, "replacing existing object");
            gateway
                .drop_cascade(&entry)
                .map_err(|e| Error::for_object(self.name(), Action::Drop, e))?;
        }

        self.create(gateway)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Mapping,
    UrlTemp,
    Tld,
    Domain,
    Url,
}

impl Table {
    pub fn schema(self) -> &'static TableSchema {
        match self {
            Table::Mapping => &MAPPING,
            Table::UrlTemp => &URL_TEMP,
            Table::Tld => &TLD,
            Table::Domain => &DOMAIN,
            Table::Url => &URL,
        }
    }
}

impl SchemaObject for Table {
    fn name(&self) -> &'static str {
        self.schema().name
    }

    fn kind(&self) -> ObjectKind {
        ObjectKind::Table
    }

    fn definition(&self) -> String {
        table_definition(self.schema())
    }

    fn is_temporary(&self) -> bool {
        self.schema().temporary
    }

    fn populate(&self, gateway: &mut Gateway, inputs: &Inputs) -> Result<u64> {
        let result = match self {
            Table::Mapping => populate::mapping(gateway, inputs),
            Table::UrlTemp => populate::url_temp(gateway, inputs),
            Table::Tld => populate::tld(gateway),
            Table::Domain => populate::domain(gateway),
            Table::Url => populate::url(gateway),
        };
        result.map_err(|e| Error::for_object(self.name(), Action::Populate, e))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    TopUrls,
    TopTlds,
    TopRepeatedDomains,
}

impl View {
    pub fn schema(self) -> &'static ViewSchema {
        match self {
            View::TopUrls => &TOP_10_URLS,
            View::TopTlds => &TOP_10_TLDS,
            View::TopRepeatedDomains => &TOP_10_REPEATED_DOMAINS,
        }
    }
}

impl SchemaObject for View {
    fn name(&self) -> &'static str {
        self.schema().name
    }

    fn kind(&self) -> ObjectKind {
        ObjectKind::View
    }

    fn definition(&self) -> String {
        self.schema().query.to_string()
    }

    /// Views hold no data of their own
    fn populate(&self, _gateway: &mut Gateway, _inputs: &Inputs) -> Result<u64> {
        Ok(0)
    }

    fn replaces(&self) -> Option<ObjectKind> {
        Some(ObjectKind::View)
    }
}

/// Any object the pipeline manages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Object {
    Table(Table),
    View(View),
}

impl Object {
    pub const ALL: [Object; 8] = [
        Object::Table(Table::Mapping),
        Object::Table(Table::UrlTemp),
        Object::Table(Table::Tld),
        Object::Table(Table::Domain),
        Object::Table(Table::Url),
        Object::View(View::TopUrls),
        Object::View(View::TopTlds),
        Object::View(View::TopRepeatedDomains),
    ];

    pub fn from_name(name: &str) -> Option<Object> {
        Self::ALL.into_iter().find(|object| object.name() == name)
    }

    fn inner(&self) -> &dyn SchemaObject {
        match self {
            Object::Table(table) => table,
            Object::View(view) => view,
        }
    }
}

impl SchemaObject for Object {
    fn name(&self) -> &'static str {
        self.inner().name()
    }

    fn kind(&self) -> ObjectKind {
        self.inner().kind()
    }

    fn definition(&self) -> String {
        self.inner().definition()
    }

    fn is_temporary(&self) -> bool {
        self.inner().is_temporary()
    }

    fn populate(&self, gateway: &mut Gateway, inputs: &Inputs) -> Result<u64> {
        self.inner().populate(gateway, inputs)
    }

    fn replaces(&self) -> Option<ObjectKind> {
        self.inner().replaces()
    }
}
