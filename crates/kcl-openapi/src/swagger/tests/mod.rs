mod canonical;
mod crd;
mod schema;
